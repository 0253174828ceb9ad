//! Command discovery, special-argument injection and dispatch for Herald.
//!
//! # Architecture
//!
//! ```text
//!  registration                          execution
//!  ────────────                          ─────────
//!  CommandHolder                         "tp 1,2,3 fast"
//!       │ methods()                           │
//!       ▼                                     ▼
//!  ┌───────────┐  ParserRegistry       ┌────────────────┐
//!  │ DISCOVERY │──────────────────┐    │ CommandManager │ label → command
//!  └───────────┘  Injectors       │    └────────────────┘
//!       │         Customizers     │           │ fresh cursor
//!       ▼                         ▼           ▼
//!  ┌──────────────────────────────────┐  ┌──────────┐
//!  │ RegisteredCommand                │─▶│ PIPELINE │ parse → inject → invoke
//!  │  arguments + special slots + body│  └──────────┘
//!  └──────────────────────────────────┘       │
//!                                             ▼
//!                                  DispatchOutcome / FailureReporter
//! ```
//!
//! # Modules
//!
//! - [`actor`] - Invoking actors and the kind hierarchy
//! - [`argument`] - Parameter declarations, arguments and customizers
//! - [`special`] - Special-argument injectors and slot tables
//! - [`builder`] - Command descriptors and their builder
//! - [`discovery`] - Command methods on holder objects
//! - [`pipeline`] - Per-invocation parsing and slot merging
//! - [`report`] - Failure reports and dispatch outcomes
//! - [`config`] - Dispatch policies
//! - [`dispatch`] - The command table and dispatcher

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod actor;
pub mod argument;
pub mod builder;
pub mod config;
pub mod discovery;
pub mod dispatch;
pub mod pipeline;
pub mod report;
pub mod special;

pub use actor::{Actor, ActorHandle, ActorKinds, CONSOLE, PLAYER, SENDER};
pub use argument::{Argument, ArgumentBuilder, Customizer, Customizers, ParamAttr, ParamDecl};
pub use builder::{
    CallContext, CommandBuilder, CommandError, CommandResult, Executor, RegisteredCommand,
};
pub use config::{AliasCollisionPolicy, DispatchConfig, UnknownCommandPolicy};
pub use discovery::{
    CommandAttr, CommandHolder, CommandMethod, Discovery, MethodBody, RegistrationReport,
};
pub use dispatch::CommandManager;
pub use pipeline::{ArgumentFailure, CallArg, ParsedArguments, merge, parse_arguments};
pub use report::{DispatchOutcome, FailureKind, FailureReport, FailureReporter, LogReporter};
pub use special::{
    ActorInjector, AliasInjector, InjectionContext, InjectionMismatch, Injectors, SlotInjector,
    SpecialArgumentTable, SpecialSlot,
};
