//! Script specific shaping data.

pub mod arabic;
mod arabic_table;

pub use arabic::{
    classify, classify_position, feature_applies, JoiningData, JoiningForms, JoiningGroup,
    JoiningNeighbors, JoiningType,
};
