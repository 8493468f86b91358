use common::prelude::{ContentId, ContentIdError};
use serde::{Deserialize, Serialize};
use sqlx::encode::IsNull;
use sqlx::error::BoxDynError;
use sqlx::sqlite::{SqliteArgumentValue, SqliteTypeInfo, SqliteValueRef};
use sqlx::{Decode, Encode, Sqlite, Type};

/// Database wrapper around [`ContentId`], stored as its multibase string
/// form in TEXT columns.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, Eq, PartialEq, Hash)]
#[serde(transparent)]
pub struct DContentId(ContentId);

impl From<ContentId> for DContentId {
    fn from(value: ContentId) -> Self {
        Self(value)
    }
}

impl From<DContentId> for ContentId {
    fn from(value: DContentId) -> Self {
        value.0
    }
}

impl Decode<'_, Sqlite> for DContentId {
    fn decode(value: SqliteValueRef<'_>) -> Result<Self, BoxDynError> {
        let db_val = <String as Decode<Sqlite>>::decode(value)?;
        let id = ContentId::parse(&db_val).map_err(DContentIdError::InvalidContentId)?;
        Ok(Self(id))
    }
}

impl Encode<'_, Sqlite> for DContentId {
    fn encode_by_ref(
        &self,
        args: &mut Vec<SqliteArgumentValue<'_>>,
    ) -> Result<IsNull, BoxDynError> {
        args.push(SqliteArgumentValue::Text(self.0.to_string().into()));
        Ok(IsNull::No)
    }
}

impl Type<Sqlite> for DContentId {
    fn type_info() -> SqliteTypeInfo {
        <String as Type<Sqlite>>::type_info()
    }

    fn compatible(ty: &SqliteTypeInfo) -> bool {
        <String as Type<Sqlite>>::compatible(ty)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DContentIdError {
    #[error("stored value was not a valid content id: {0}")]
    InvalidContentId(#[from] ContentIdError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_writes_multibase_text() {
        let id = ContentId::derive(b"\xa0");
        let wrapped = DContentId::from(id);

        let mut args = Vec::new();
        let is_null = wrapped.encode_by_ref(&mut args).unwrap();

        assert!(matches!(is_null, IsNull::No));
        match args.pop() {
            Some(SqliteArgumentValue::Text(text)) => assert_eq!(text.as_ref(), id.to_string()),
            _ => panic!("expected a single text argument"),
        }
    }
}
