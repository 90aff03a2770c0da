use utoipa::OpenApi;
use wayfarer::openapi::ApiDoc;

fn main() {
    println!(
        "{}",
        ApiDoc::openapi()
            .to_pretty_json()
            .expect("API doc serializes")
    );
}
