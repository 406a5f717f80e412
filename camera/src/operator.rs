use crate::common::*;

/// The person arranging the object between capture rounds.
pub trait Operator {
    /// Shows `prompt` and blocks until the operator is ready.
    fn confirm(&mut self, prompt: &str) -> Result<()>;
}

/// Prompts on standard output and waits for a line on standard input.
#[derive(Debug, Default)]
pub struct StdinOperator {
    _private: (),
}

impl StdinOperator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Operator for StdinOperator {
    fn confirm(&mut self, prompt: &str) -> Result<()> {
        let mut stdout = io::stdout();
        write!(stdout, "{} ", prompt)?;
        stdout.flush()?;

        let mut line = String::new();
        let len = io::stdin().lock().read_line(&mut line)?;
        ensure!(len > 0, "operator input is closed");
        Ok(())
    }
}

impl<O> Operator for &mut O
where
    O: Operator + ?Sized,
{
    fn confirm(&mut self, prompt: &str) -> Result<()> {
        (**self).confirm(prompt)
    }
}
