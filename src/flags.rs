use bitflags::bitflags;

bitflags! {
    /// Column and property option flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct PropertyFlags: u8 {
        /// The column accepts [`Value::Null`].
        ///
        /// Link columns are always nullable, regardless of this flag.
        ///
        /// [`Value::Null`]: crate::Value::Null
        const NULLABLE = 0x01;

        /// The column is indexed.
        ///
        /// Advisory only; the in-memory engine scans regardless.
        const INDEXED = 0x02;

        /// The column is the class's primary key.
        const PRIMARY_KEY = 0x04;
    }
}

impl PropertyFlags {
    /// Returns `true` if the flags allow null values.
    #[inline]
    pub const fn is_nullable(self) -> bool {
        self.contains(Self::NULLABLE)
    }
}
