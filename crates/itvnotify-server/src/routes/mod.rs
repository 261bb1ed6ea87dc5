pub mod home;
pub mod send;
