use std::path::Path;

/// Where a log call was made.
///
/// Captured at macro expansion by [`call_site!`](crate::call_site), so the
/// reported location is always the line that invoked `debug!`, `error!`
/// and friends, whichever severity was used. There is no stack walking and
/// therefore no frame offset to keep in sync with the facade's call depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallSite<'a> {
    /// Last path segment of the enclosing function.
    pub function: &'a str,
    /// Base name of the source file.
    pub file: &'a str,
    pub line: u32,
}

impl<'a> CallSite<'a> {
    pub fn new(function: &'a str, file: &'a str, line: u32) -> Self {
        Self {
            function: short_function_name(function),
            file: file_base_name(file),
            line,
        }
    }
}

/// Trims a fully qualified function path down to the function's own name.
///
/// Closure frames (`{{closure}}`) are skipped so a call inside a closure
/// reports the function that defines it.
pub fn short_function_name(path: &str) -> &str {
    let mut trimmed = path;
    while let Some(rest) = trimmed.strip_suffix("::{{closure}}") {
        trimmed = rest;
    }
    trimmed.rsplit("::").next().unwrap_or(trimmed)
}

pub fn file_base_name(file: &str) -> &str {
    Path::new(file)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(file)
}

/// Captures the [`CallSite`] of the place where it is expanded.
#[macro_export]
macro_rules! call_site {
    () => {{
        fn __rotlog_here() {}
        fn __rotlog_type_name<T>(_: T) -> &'static str {
            ::std::any::type_name::<T>()
        }
        let path = __rotlog_type_name(__rotlog_here);
        let path = path.strip_suffix("::__rotlog_here").unwrap_or(path);
        $crate::callsite::CallSite::new(path, file!(), line!())
    }};
}
