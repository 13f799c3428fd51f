mod common;

use common::{context, get_json};

#[tokio::test]
async fn health_reports_ok_with_reachable_store() {
    let ctx = context();

    let (status, body) = get_json(&ctx.app, "/health").await;

    assert_eq!(status, 200);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["dbHealthy"], true);
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}
