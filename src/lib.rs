//! SGP4/SDP4 orbit propagation.
//!
//! A [`Propagator`] is built once per element set and answers queries for
//! the inertial position and velocity at any time relative to the element
//! epoch. Orbits with an un-Kozai'd period of 225 minutes or more go through
//! the deep-space theory: luni-solar secular and periodic terms, and for
//! 12-hour and one-day orbits the numerically integrated geopotential
//! resonance.
//!
//! ```no_run
//! use sdp4::{ElementSet, Propagator};
//!
//! let elements = ElementSet {
//!     ndot: 0.01431103,
//!     nddot: 0.0,
//!     bstar: 0.14311e-1,
//!     inclination_deg: 46.7916,
//!     raan_deg: 230.4354,
//!     eccentricity_e7: 7318036,
//!     arg_perigee_deg: 47.4722,
//!     mean_anomaly_deg: 10.4117,
//!     mean_motion: 2.28537848,
//!     epoch: 80230.29629788,
//! };
//! let mut sat = Propagator::from_elements(&elements)?;
//! let state = sat.propagate(1440.0)?;
//! println!("{:?} km, {:?} km/s", state.position, state.velocity);
//! # Ok::<(), sdp4::Sdp4Error>(())
//! ```

pub mod constants;
pub mod deep_space;
pub mod earth_gravity;
pub mod elements;
pub mod epoch;
pub mod error;
pub mod kepler;
pub mod near_earth;
pub mod propagation;

pub use deep_space::resonance::{IntegratorPhase, Resonance};
pub use earth_gravity::{EarthGravity, GravityModel};
pub use elements::{ElementSet, MeanElements};
pub use epoch::TleEpoch;
pub use error::{PropagationWarning, Sdp4Error};
pub use kepler::{solve_kepler, KeplerSolution};
pub use near_earth::DerivedSecularConstants;
pub use propagation::{ModelSelection, PropagationResult, Propagator, PropagatorOptions, Theory};
