//! A small virtual pet: three clamped meters, a handful of actions, a
//! passive decay tick and the directives that tell a renderer what to show.

pub mod animation;
pub mod app;
pub mod config;
pub mod controller;
pub mod directive;
pub mod frames;
pub mod input;
pub mod model;
pub mod render;
pub mod sim;
pub mod timer;

pub use controller::{ActionController, Command, CommandReport, RenamePolicy};
pub use directive::{ActivityDirective, DirectiveTable, LoopPolicy, ResolvedDirectives};
pub use model::{ActionReport, Activity, Outcome, PetState, Rejection, Rules, Stats};
pub use timer::{Scheduler, TimerEvent, TimerId, TimerQueue};
