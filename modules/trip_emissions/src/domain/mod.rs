pub mod emission;
pub mod error;
pub mod factors;
pub mod model;
pub mod renderer;
pub mod repo;
pub mod resolver;
pub mod service;

pub use error::DomainError;
pub use factors::{CreditPrice, EmissionFactors, FactorsSnapshot};
pub use model::{
    CalcInputs, CalcResults, CalculationRecord, Coordinates, NewCalculation, PlaceSuggestion,
};
pub use renderer::ReceiptRenderer;
pub use repo::CalcRepository;
pub use resolver::RouteResolver;
pub use service::{CalcCommand, EmissionsService, ServiceLimits};
