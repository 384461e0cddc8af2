pub mod ad_requests;
pub mod ads;
pub mod reviews;
pub mod users;
