use actix_web_flash_messages::Level;
use frs_admin::routes::{alert_level_to_str, redirect};

#[test]
fn test_alert_level_to_str_mappings() {
    assert_eq!(alert_level_to_str(&Level::Error), "danger");
    assert_eq!(alert_level_to_str(&Level::Warning), "warning");
    assert_eq!(alert_level_to_str(&Level::Success), "success");
    assert_eq!(alert_level_to_str(&Level::Info), "info");
    assert_eq!(alert_level_to_str(&Level::Debug), "info");
}

#[test]
fn test_redirect_uses_see_other() {
    let response = redirect("/volunteers");
    assert_eq!(response.status(), actix_web::http::StatusCode::SEE_OTHER);
    assert_eq!(
        response
            .headers()
            .get(actix_web::http::header::LOCATION)
            .unwrap(),
        "/volunteers"
    );
}
