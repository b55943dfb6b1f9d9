pub(crate) mod num;
pub(crate) mod zero;
