#[tokio::main]
async fn main() {
    parkify_backend::run().await;
}
