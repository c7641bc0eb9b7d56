pub mod agenda;
pub mod done;
pub mod new;
pub mod rm;
