pub mod naive_bayes;
pub mod r_scripts;
pub mod random_forest;

pub mod classifier_trait;
pub mod factory;
