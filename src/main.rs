//! # img-compare CLI
//!
//! Command-line interface for image comparison.
//!
//! ## Usage
//! ```bash
//! img-compare compare before.png after.png --threshold 45
//! img-compare compare before.png after.png --output json --diff-output diff.png
//! img-compare hash photo.jpg
//! ```

mod cli;

use image_similarity::Result;

fn main() -> Result<()> {
    cli::run()
}
