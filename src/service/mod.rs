pub mod evaluator;
pub mod markup;
pub mod numeric;
