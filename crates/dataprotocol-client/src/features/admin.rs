use dataprotocol_types::{
    CreateDatabaseParams, CreateDatabaseResponse, CreateLoginParams, CreateLoginResponse,
    DatabaseInfo, DefaultDatabaseInfoParams, GetDatabaseInfoParams, LoginInfo, Options,
};

use crate::contracts::admin;
use crate::convert::from_wire;

provider_handle! {
    /// Database and login administration.
    AdminServicesProvider
}

impl AdminServicesProvider {
    pub async fn create_database(
        &self,
        owner_uri: &str,
        database_info: DatabaseInfo,
    ) -> Option<CreateDatabaseResponse> {
        let params = CreateDatabaseParams {
            owner_uri: owner_uri.to_string(),
            database_info,
        };
        self.conn
            .request_optional(admin::CREATE_DATABASE, &params)
            .await
    }

    pub async fn get_default_database_info(&self, owner_uri: &str) -> Option<DatabaseInfo> {
        let params = DefaultDatabaseInfoParams {
            owner_uri: owner_uri.to_string(),
        };
        self.conn
            .request_optional(admin::DEFAULT_DATABASE_INFO, &params)
            .await
            .map(from_wire::default_database_info)
    }

    pub async fn get_database_info(&self, owner_uri: &str, options: Options) -> Option<DatabaseInfo> {
        let params = GetDatabaseInfoParams {
            owner_uri: owner_uri.to_string(),
            options,
        };
        self.conn
            .request_optional(admin::GET_DATABASE_INFO, &params)
            .await
            .map(from_wire::database_info)
    }

    pub async fn create_login(
        &self,
        owner_uri: &str,
        login_info: LoginInfo,
    ) -> Option<CreateLoginResponse> {
        let params = CreateLoginParams {
            owner_uri: owner_uri.to_string(),
            login_info,
        };
        self.conn.request_optional(admin::CREATE_LOGIN, &params).await
    }
}
