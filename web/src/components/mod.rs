pub mod detail;
pub mod nav;
pub mod paginator;
pub mod placeholders;
pub mod project_card;
pub mod projects_map;
pub mod search_results;
