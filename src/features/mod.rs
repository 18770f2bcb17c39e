#[cfg(feature = "regex")]
#[cfg_attr(feature = "doc-cfg", doc(cfg(feature = "regex")))]
mod regex;
