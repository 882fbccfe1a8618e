// Application layer - Use cases over the domain
pub mod dashboard_service;
pub mod metro_loader;
pub mod metro_repository;
pub mod pdf_export;
