// Domain-layer modules: the enrichment pipeline and its pure building blocks
pub mod pipeline {
    pub use crate::pipeline::*;
}

pub mod mappers {
    pub use crate::mappers::*;
}

pub mod classification {
    pub use crate::age::*;
    pub use crate::person_kind::*;
    pub use crate::size_classifier::*;
}

pub mod errors {
    pub use crate::errors::*;
}
