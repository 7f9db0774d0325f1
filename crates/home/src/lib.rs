//! # Smart Home Core
//!
//! House topology, fixtures, the yard and action dispatch, tied together by
//! a [`Session`].
//!
//! ## Example
//!
//! ```no_run
//! use home::{Session, Target, WallSlot};
//! use rbac::{Action, Permission};
//! use shared::LayoutSpec;
//! use std::path::Path;
//!
//! let layout = LayoutSpec::from_file(Path::new("house.json"))?;
//! let mut session = Session::new();
//! session.load_layout(&layout)?;
//! session.set_actor("alice", Permission::parent(), "kitchen")?;
//!
//! let report = session.attempt(
//!     Action::ToggleDoorOpen,
//!     Target::Door { room: "kitchen".into(), slot: WallSlot::North },
//! )?;
//! println!("{}", report.outcome);
//! # Ok::<(), shared::HomeError>(())
//! ```

pub mod fixture;
pub mod house;
pub mod modes;
pub mod outcome;
pub mod room;
pub mod session;
pub mod transition;
pub mod yard;

pub use fixture::{Door, DoorState, Light, WallSlot, Window, WindowState};
pub use house::{House, HouseSnapshot, Location, MAX_CONNECTIONS};
pub use modes::{AwayDelay, AwayMode, LightWindow, ModeSettings};
pub use outcome::{Blocked, Outcome};
pub use room::{Room, RoomSummary, DEFAULT_TEMPERATURE};
pub use session::{ActionReport, Actor, Session, Target};
pub use transition::{do_action, Manipulable};
pub use yard::{Yard, YARD_LOCATION};
