use std::io;
use std::path::Path;

use miette::{miette, Report, Severity};

// Image loading errors

pub fn image_open(path: &Path, err: io::Error) -> Report {
    miette!(
        severity = Severity::Error,
        code = "image::open",
        help = "check that the path exists and is readable.",
        "Could not open image file {}: {err}",
        path.display(),
    )
}

pub fn image_no_origin(path: &Path) -> Report {
    miette!(
        severity = Severity::Error,
        code = "image::origin",
        help = "object files start with a 2-byte big-endian load origin.",
        "Image file {} is too short to hold an origin.",
        path.display(),
    )
}
