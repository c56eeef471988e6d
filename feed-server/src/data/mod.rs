pub mod author_repository;
pub mod comment_repository;
#[cfg(test)]
pub mod in_memory;
pub mod post_repository;
pub mod profile_repository;
pub mod store;
