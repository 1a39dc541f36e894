// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    Candidate, CategoryDestination, Destination, DestinationTable, FamilyMember, FilterCriteria,
    NearestDestination, RecommendedDestination,
};
pub use requests::{ByCategoryQuery, Family, NearestQuery, RecommendRequest};
pub use responses::{
    ByCategoryResponse, ErrorResponse, HealthResponse, RecommendResponse, RecordSavedResponse,
};
