/// Report downloads.
pub mod download;
/// Health check.
pub mod health;
/// Server-rendered pages.
pub mod pages;
/// Research job start and progress.
pub mod research;
