pub mod assert;
pub mod migrations;

use crate::{error::ApiResult, DbPool};
use actix_web::web;
use anyhow::Context;
use diesel::{r2d2::ConnectionManager, PgConnection};
use r2d2::PooledConnection;

pub fn build_pool(database_url: &str, max_size: u32) -> anyhow::Result<DbPool> {
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    r2d2::Pool::builder()
        .max_size(max_size)
        .build(manager)
        .context("Failed to create pool")
}

pub fn get_db_conn(pool: &DbPool) -> ApiResult<PooledConnection<ConnectionManager<PgConnection>>> {
    Ok(pool.get()?)
}

/// Runs `f` with a pooled connection on the blocking thread pool.
pub async fn with_conn<F, T>(pool: &web::Data<DbPool>, f: F) -> ApiResult<T>
where
    F: FnOnce(&mut PgConnection) -> ApiResult<T> + Send + 'static,
    T: Send + 'static,
{
    let pool = pool.clone();
    web::block(move || {
        let mut conn = get_db_conn(&pool)?;
        f(&mut *conn)
    })
    .await?
}
