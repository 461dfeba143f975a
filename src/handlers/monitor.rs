use actix_web::{web, HttpResponse, Result};
use crate::models::{AnalysisOutcome, ApiResponse, MonitorReport};
use crate::services::stock::common::is_valid_code;
use crate::state::AppState;

/// 对整份自选股执行一次监控
pub async fn run_monitor(state: web::Data<AppState>) -> Result<HttpResponse> {
    // 先复制一份名单，锁不跨 await
    let codes = state.watchlist().codes().to_vec();

    let report = state
        .monitor
        .run(&codes, |done, total| {
            log::info!("⏳ 监控进度 {}/{}", done, total);
        })
        .await;

    let message = report.message.clone().unwrap_or_else(|| "Success".to_string());
    let response = ApiResponse::<MonitorReport>::success_with_message(report, message);
    Ok(HttpResponse::Ok().json(response))
}

/// 分析单只股票，不要求在自选股中
pub async fn get_signal(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let code = path.into_inner();
    if !is_valid_code(&code) {
        let response = ApiResponse::<AnalysisOutcome>::error(format!(
            "无效的股票代码: {}，应为 6 位数字",
            code
        ));
        return Ok(HttpResponse::BadRequest().json(response));
    }

    let outcome = state.monitor.analyze_one(&code).await;
    match outcome.signal() {
        Some(signal) => log::info!("{} {} 排序分 {}", signal.code, signal.name, signal.score),
        None => log::info!("{} 无有效信号", code),
    }
    Ok(HttpResponse::Ok().json(ApiResponse::success(outcome)))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/monitor", web::get().to(run_monitor))
        .route("/signals/{code}", web::get().to(get_signal));
}
