pub mod advisors;
pub mod appointments;
pub mod feedback;
pub mod notifications;
pub mod users;

pub mod user_logins;
