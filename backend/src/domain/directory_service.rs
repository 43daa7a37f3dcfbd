//! User and car-share directory services.
//!
//! Plain create and read operations with no trip semantics. Car-shares are
//! always created with an empty trip list.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{
    CarShareDirectory, CarShareRepository, CarShareRepositoryError, CreateCarShareRequest,
    RegisterUserRequest, UserDirectory, UserRepository, UserRepositoryError,
};
use crate::domain::{
    CarShare, CarShareDraft, CarShareId, DisplayName, Error, User, UserId,
};

fn map_user_repository_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserRepositoryError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
    }
}

fn map_car_share_repository_error(error: CarShareRepositoryError) -> Error {
    match error {
        CarShareRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("car-share repository unavailable: {message}"))
        }
        CarShareRepositoryError::Query { message } => {
            Error::internal(format!("car-share repository error: {message}"))
        }
        CarShareRepositoryError::Missing { id } => {
            Error::not_found(format!("car-share {id} not found"))
        }
    }
}

/// Service implementing [`UserDirectory`].
#[derive(Clone)]
pub struct UserDirectoryService<U> {
    users: Arc<U>,
}

impl<U> UserDirectoryService<U> {
    /// Build the service over a user store.
    #[must_use]
    pub const fn new(users: Arc<U>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl<U> UserDirectory for UserDirectoryService<U>
where
    U: UserRepository,
{
    async fn register(&self, request: RegisterUserRequest) -> Result<User, Error> {
        let name = DisplayName::new(request.display_name).map_err(|err| {
            Error::invalid_request(err.to_string())
                .with_details(serde_json::json!({ "field": "displayName" }))
        })?;
        let user = User::new(UserId::random(), name)
            .with_anonymous(request.is_anonymous)
            .with_linked(request.is_linked);

        self.users
            .insert(&user)
            .await
            .map_err(map_user_repository_error)?;
        info!(user_id = %user.id(), "user registered");
        Ok(user)
    }

    async fn get(&self, id: UserId) -> Result<User, Error> {
        self.users
            .find_by_id(&id)
            .await
            .map_err(map_user_repository_error)?
            .ok_or_else(|| Error::not_found(format!("user {id} not found")))
    }

    async fn list(&self) -> Result<Vec<User>, Error> {
        self.users.list().await.map_err(map_user_repository_error)
    }
}

/// Service implementing [`CarShareDirectory`].
///
/// Admin ids must name existing users.
#[derive(Clone)]
pub struct CarShareDirectoryService<C, U> {
    car_shares: Arc<C>,
    users: Arc<U>,
}

impl<C, U> CarShareDirectoryService<C, U> {
    /// Build the service over the car-share store and the user store used to
    /// check admins.
    #[must_use]
    pub const fn new(car_shares: Arc<C>, users: Arc<U>) -> Self {
        Self { car_shares, users }
    }
}

#[async_trait]
impl<C, U> CarShareDirectory for CarShareDirectoryService<C, U>
where
    C: CarShareRepository,
    U: UserRepository,
{
    async fn create(&self, request: CreateCarShareRequest) -> Result<CarShare, Error> {
        for admin in &request.admin_ids {
            let found = self
                .users
                .find_by_id(admin)
                .await
                .map_err(map_user_repository_error)?;
            if found.is_none() {
                return Err(Error::not_found(format!("user {admin} not found"))
                    .with_details(serde_json::json!({ "field": "adminIds", "userId": admin })));
            }
        }

        let car_share = CarShare::new(CarShareDraft {
            id: CarShareId::random(),
            name: request.name,
            metres: request.metres,
            admin_ids: request.admin_ids,
            trip_ids: Vec::new(),
        })
        .map_err(|err| {
            Error::invalid_request(err.to_string())
                .with_details(serde_json::json!({ "field": err.field() }))
        })?;

        self.car_shares
            .insert(&car_share)
            .await
            .map_err(map_car_share_repository_error)?;
        info!(car_share_id = %car_share.id(), "car-share created");
        Ok(car_share)
    }

    async fn get(&self, id: CarShareId) -> Result<CarShare, Error> {
        self.car_shares
            .find_by_id(&id)
            .await
            .map_err(map_car_share_repository_error)?
            .ok_or_else(|| Error::not_found(format!("car-share {id} not found")))
    }

    async fn list(&self) -> Result<Vec<CarShare>, Error> {
        self.car_shares
            .list()
            .await
            .map_err(map_car_share_repository_error)
    }
}
