/*!
Error printer for `main`: the error itself, then every `source()` below it.
*/

use std::{error::Error as StdError, fmt, iter::successors};

pub struct Report(Box<dyn StdError>);

impl Report {
    /// The chain of underlying errors, outermost first.
    pub fn causes(&self) -> impl Iterator<Item = &(dyn StdError + 'static)> + '_ {
        successors(self.0.source(), |&cause| cause.source())
    }
}

impl fmt::Debug for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.0)?;

        let mut causes = self.causes().enumerate().peekable();
        if causes.peek().is_some() {
            writeln!(f, "\nCaused by:")?;
        }
        for (depth, cause) in causes {
            writeln!(f, "  {}: {}", depth + 1, cause)?;
        }

        Ok(())
    }
}

impl<E: Into<Box<dyn StdError>>> From<E> for Report {
    fn from(error: E) -> Self {
        Report(error.into())
    }
}
