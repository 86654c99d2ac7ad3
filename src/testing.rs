//! Database fixtures for tests.
//!
//! Tests that need Postgres call [`test_conn`] and return early when
//! `TEST_DATABASE_URL` is not set. Every connection runs inside a test
//! transaction, so nothing is committed. [`test_pool`] is for full-app
//! tests whose rows must be visible across connections; those tests clean
//! up after themselves.

use std::sync::Once;

use diesel::prelude::*;
use uuid::Uuid;

use crate::{
    database::{self, migrations},
    models::{
        advisors::{AdvisorData, NewAdvisor},
        users::{NewUser, Role, UserData},
    },
    utils, DbPool,
};

static MIGRATE: Once = Once::new();

fn migrate_once(url: &str) {
    MIGRATE.call_once(|| {
        let mut conn = PgConnection::establish(url).expect("connect to test database");
        migrations::run(&mut conn).expect("migrate test database");
    });
}

pub fn test_conn() -> Option<PgConnection> {
    let url = std::env::var("TEST_DATABASE_URL").ok()?;
    migrate_once(&url);

    let mut conn = PgConnection::establish(&url).expect("connect to test database");
    conn.begin_test_transaction().expect("begin test transaction");
    Some(conn)
}

pub fn test_pool() -> Option<DbPool> {
    let url = std::env::var("TEST_DATABASE_URL").ok()?;
    migrate_once(&url);
    Some(database::build_pool(&url, 2).expect("build test pool"))
}

pub fn create_user(conn: &mut PgConnection, role: Role) -> UserData {
    use crate::schema::users;

    let id = Uuid::new_v4();
    let user = NewUser {
        id,
        email: format!("{}@test.edu", id.simple()),
        password: utils::hash_password("secret1"),
        role: role.as_str().to_string(),
        first_name: "Test".to_string(),
        last_name: role.as_str().to_string(),
        phone_number: None,
    };
    diesel::insert_into(users::table)
        .values(&user)
        .get_result(conn)
        .expect("insert user")
}

pub fn create_student(conn: &mut PgConnection) -> UserData {
    create_user(conn, Role::Student)
}

pub fn create_advisor(conn: &mut PgConnection) -> (UserData, AdvisorData) {
    use crate::schema::advisors;

    let user = create_user(conn, Role::Advisor);
    let advisor = diesel::insert_into(advisors::table)
        .values(NewAdvisor {
            id: Uuid::new_v4(),
            user_id: user.id,
            department: "Computer Science".to_string(),
            designation: "Lecturer".to_string(),
            available_days: "Monday,Wednesday".to_string(),
        })
        .get_result(conn)
        .expect("insert advisor");
    (user, advisor)
}
