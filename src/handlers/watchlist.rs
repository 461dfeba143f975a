use actix_web::{web, HttpResponse, Result};
use crate::models::{AddCodeRequest, ApiResponse, SyncRequest, SyncResult, WatchListView};
use crate::services::watchlist::WatchList;
use crate::state::AppState;

fn view(list: &WatchList) -> WatchListView {
    WatchListView {
        codes: list.codes().to_vec(),
        total: list.len(),
    }
}

pub async fn list_codes(state: web::Data<AppState>) -> Result<HttpResponse> {
    let list = state.watchlist();
    Ok(HttpResponse::Ok().json(ApiResponse::success(view(&list))))
}

/// 手动添加单只股票
pub async fn add_code(
    state: web::Data<AppState>,
    body: web::Json<AddCodeRequest>,
) -> Result<HttpResponse> {
    let mut list = state.watchlist();

    match list.add(&body.code) {
        Ok(added) => {
            let message = if added { "添加成功" } else { "已在名单中" };
            log::info!("自选股 {}: {}", body.code.trim(), message);
            Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(view(&list), message)))
        }
        Err(e) => {
            let response = ApiResponse::<WatchListView>::error(e.to_string());
            Ok(HttpResponse::BadRequest().json(response))
        }
    }
}

/// 批量粘贴同步
pub async fn sync_codes(
    state: web::Data<AppState>,
    body: web::Json<SyncRequest>,
) -> Result<HttpResponse> {
    let mut list = state.watchlist();
    let added = list.sync_from_text(&body.text);
    log::info!("批量同步新增 {} 只，共 {} 只", added, list.len());

    let result = SyncResult {
        added,
        codes: list.codes().to_vec(),
    };
    Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(result, "同步成功")))
}

pub async fn remove_code(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let code = path.into_inner();
    let mut list = state.watchlist();

    if list.remove(&code) {
        Ok(HttpResponse::Ok().json(ApiResponse::success(view(&list))))
    } else {
        let response = ApiResponse::<WatchListView>::error(format!("{} 不在名单中", code));
        Ok(HttpResponse::NotFound().json(response))
    }
}

/// 清空名单
pub async fn clear_codes(state: web::Data<AppState>) -> Result<HttpResponse> {
    let mut list = state.watchlist();
    list.clear();
    log::info!("自选股名单已清空");
    Ok(HttpResponse::Ok().json(ApiResponse::success(view(&list))))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/watchlist")
            .route("", web::get().to(list_codes))
            .route("", web::post().to(add_code))
            .route("", web::delete().to(clear_codes))
            .route("/sync", web::post().to(sync_codes))
            .route("/{code}", web::delete().to(remove_code))
    );
}
