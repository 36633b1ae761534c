pub mod decomposition;
pub mod dense;
pub mod error;
pub mod geometry;
pub mod svec;
pub mod whiten;
mod utils;

pub use dense::{center, center_in_place, covariance, remove_rows};
pub use error::LinAlgError;
pub use geometry::{orthogonalize, orthogonalize_in_place, rand_unit_vector, rand_vector};
pub use svec::{smat, svec, svec_index, sym_kron_id};
pub use utils::{vector_power, VectorPower, DEFAULT_TOLERANCE};
pub use whiten::{whiten_using_eig, whiten_using_svd, WhitenMethod, Whitened, WhitenerBuilder};
