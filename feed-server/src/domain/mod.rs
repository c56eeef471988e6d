pub mod author;
pub mod comment;
pub mod error;
pub mod feed_query;
pub mod post;
pub mod profile;
pub mod tags;
