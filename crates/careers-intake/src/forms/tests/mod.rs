mod common;
mod session;
mod submission;
