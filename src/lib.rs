pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod util;

pub mod models {
    pub mod announcement;
    pub mod assignment;
    pub mod course;
    pub mod profile;
    pub mod session;
}

pub mod services {
    pub mod announcements;
    pub mod assignments;
    pub mod auth;
    pub mod courses;
    pub mod grades;
    pub mod profile;
    pub mod request;
    pub mod token;
}

pub mod handlers {
    pub mod assignments;
    pub mod auth;
    pub mod courses;
    pub mod profile;
    pub mod raw;
}

pub mod middleware_layer {
    pub mod auth;
}

pub mod validation {
    pub mod auth;
}
