pub mod budget;
pub mod extract;
pub mod image;
pub mod ledger;
pub mod nutrition;
pub mod prompt;
pub mod reference;
pub mod vision;

pub use ledger::DailyLedger;
pub use nutrition::NutritionEnricher;
pub use vision::{OpenRouterVision, VisionService};
