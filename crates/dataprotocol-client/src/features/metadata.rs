use dataprotocol_types::{
    ColumnMetadata, ListDatabasesParams, MetadataQueryParams, ObjectMetadata, ProviderMetadata,
};

use crate::contracts::{connection, metadata};
use crate::convert::{from_wire, to_wire};

provider_handle! {
    /// Schema browsing: object lists and table/view column info.
    MetadataProvider
}

impl MetadataProvider {
    pub async fn get_metadata(&self, owner_uri: &str) -> Option<ProviderMetadata> {
        let params = MetadataQueryParams {
            owner_uri: owner_uri.to_string(),
        };
        self.conn
            .request_optional(metadata::LIST, &params)
            .await
            .map(from_wire::provider_metadata)
    }

    /// Database names on the server behind `owner_uri`.
    pub async fn get_databases(&self, owner_uri: &str) -> Vec<String> {
        let params = ListDatabasesParams {
            owner_uri: owner_uri.to_string(),
        };
        self.conn
            .request_or_default(connection::LIST_DATABASES, &params)
            .await
            .database_names
    }

    pub async fn get_table_info(
        &self,
        owner_uri: &str,
        object: &ObjectMetadata,
    ) -> Vec<ColumnMetadata> {
        let params = to_wire::table_metadata_params(owner_uri, object);
        self.conn
            .request_or_default(metadata::TABLE, &params)
            .await
            .columns
    }

    pub async fn get_view_info(
        &self,
        owner_uri: &str,
        object: &ObjectMetadata,
    ) -> Vec<ColumnMetadata> {
        let params = to_wire::table_metadata_params(owner_uri, object);
        self.conn
            .request_or_default(metadata::VIEW, &params)
            .await
            .columns
    }
}
