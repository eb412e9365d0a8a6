/*
 * The application logic layer, centred on `GrepGrouperLogic`, which acts as
 * the presenter between user actions and the console. Unit tests for it are
 * in `handler_tests.rs`.
 */
pub mod handler;


pub use handler::GrepGrouperLogic;
