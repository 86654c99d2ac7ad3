//! Fire-and-forget notifications.
//!
//! The row insert and the push send happen on a spawned task after the
//! caller has committed; failures are logged and never reach the client.

use actix_web::web;
use serde_json::json;
use uuid::Uuid;

use crate::{database, models::notifications::NewNotification, push::PushClient, DbPool};

use super::db;

/// An in-app notification plus the push text shown on the device.
pub struct Dispatch {
    pub user_id: Uuid,
    pub appointment_id: Option<Uuid>,
    pub kind: &'static str,
    pub title: String,
    pub message: String,
    pub push_title: String,
    pub push_body: String,
}

impl Dispatch {
    fn to_row(&self) -> NewNotification {
        NewNotification {
            id: Uuid::new_v4(),
            user_id: self.user_id,
            appointment_id: self.appointment_id,
            title: self.title.clone(),
            message: self.message.clone(),
            kind: self.kind.to_string(),
        }
    }
}

pub fn spawn(pool: web::Data<DbPool>, push: web::Data<PushClient>, dispatch: Dispatch) {
    actix_web::rt::spawn(async move {
        deliver(pool, push, dispatch).await;
    });
}

async fn deliver(pool: web::Data<DbPool>, push: web::Data<PushClient>, dispatch: Dispatch) {
    let row = dispatch.to_row();
    let user_id = dispatch.user_id;

    let token = database::with_conn(&pool, move |conn| {
        db::create(conn, &row)?;
        db::push_token_of(conn, user_id)
    })
    .await;

    let token = match token {
        Ok(Some(token)) => token,
        Ok(None) => return,
        Err(err) => {
            tracing::error!(error = %err, %user_id, kind = dispatch.kind, "failed to store notification");
            return;
        }
    };

    let data = json!({
        "type": dispatch.kind,
        "appointmentId": dispatch.appointment_id,
    });
    let outcome = push
        .send(&token, &dispatch.push_title, &dispatch.push_body, data)
        .await;
    if !outcome.is_success() {
        tracing::warn!(%user_id, errors = ?outcome.errors, "push notification not delivered");
    }
}
