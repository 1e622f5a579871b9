use crate::data::{Error, Operation, SIGNIFICANT_DIGITS};
use tracing::warn;

/// Trait for doing something with an `Operation` read from a CSV journal
/// (or received from elsewhere). `Atm` implements it to apply the operation;
/// tests implement it to check what the reader produces.
pub trait OperationUser {
    fn use_op(&mut self, op: Operation) -> Result<(), Error>;
}

/// CSV importer for `Operation`s. A row the user rejects is logged with its
/// line in the journal and skipped; a row that can't be parsed aborts the
/// import. Returns how many operations were applied.
pub fn read_operations<R: std::io::Read, U: OperationUser>(
    reader: R,
    user: &mut U,
) -> Result<usize, anyhow::Error> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = rdr.headers()?.clone();
    let mut record = csv::StringRecord::new();
    let mut applied = 0;
    while rdr.read_record(&mut record)? {
        let mut op: Operation = record.deserialize(Some(&headers))?;
        if let Some(mut amount) = op.amount {
            amount.rescale(SIGNIFICANT_DIGITS);
            op.amount = Some(amount);
        }
        let line = record.position().map_or(0, |pos| pos.line());
        let (optype, key) = (op.optype, op.key());
        if let Err(e) = user.use_op(op) {
            warn!(line, ?optype, account = %key, "operation rejected: {e}");
            continue;
        }
        applied += 1;
    }
    Ok(applied)
}
