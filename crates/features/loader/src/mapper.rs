use census_domain::Row;

/// Reshapes a raw source row before it is stamped and persisted.
///
/// Plain closures `Fn(Row) -> Row` are mappers.
pub trait RowMapper: Send + Sync {
    fn map(&self, row: Row) -> Row;
}

/// Leaves rows untouched.
#[derive(Debug, Default, Clone, Copy)]
pub struct IdentityMapper;

impl RowMapper for IdentityMapper {
    fn map(&self, row: Row) -> Row {
        row
    }
}

impl<F> RowMapper for F
where
    F: Fn(Row) -> Row + Send + Sync,
{
    fn map(&self, row: Row) -> Row {
        self(row)
    }
}
