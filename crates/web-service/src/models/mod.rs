pub mod applications;

pub mod common;

pub mod err;

pub mod projects;

pub mod teams;

pub mod users;
