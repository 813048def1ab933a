//! Базовые ECS компоненты симуляции

pub mod actor;

pub use actor::ActorRole;
