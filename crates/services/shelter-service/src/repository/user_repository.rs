//! User repository implementation.
//!
//! Roles live in the `user_roles` join table; every read assembles the
//! user row with its role rows into a `RoleSet`.

use async_trait::async_trait;
use sea_orm::{
    AccessMode, ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection,
    DatabaseTransaction, EntityTrait, IsolationLevel, ModelTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use super::entities::user_role::{self, Entity as UserRoleEntity};
use common::{AppError, AppResult};
use domain::{ensure_super_admin_capacity, NewUser, Role, RoleSet, User, UserChanges};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Find user by email address
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Find the oldest user carrying the given national id
    async fn find_by_national_id(&self, national_id: &str) -> AppResult<Option<User>>;

    /// List all users ordered by name
    async fn list(&self) -> AppResult<Vec<User>>;

    /// Count accounts holding SUPER_ADMIN
    async fn count_super_admins(&self) -> AppResult<u64>;

    /// Create a new user with its roles.
    ///
    /// When the role set includes SUPER_ADMIN, the ceiling is re-checked and
    /// the insert performed inside one SERIALIZABLE transaction.
    async fn create(&self, user: NewUser) -> AppResult<User>;

    /// Update profile columns
    async fn update(&self, id: Uuid, changes: UserChanges) -> AppResult<User>;

    /// Replace the role set; adding SUPER_ADMIN re-checks the ceiling transactionally
    async fn set_roles(&self, id: Uuid, roles: RoleSet) -> AppResult<User>;

    /// Replace the stored password hash
    async fn set_password(&self, id: Uuid, password_hash: String) -> AppResult<()>;

    /// Permanently delete user from database
    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of UserRepository
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn begin(&self, roles: &RoleSet) -> AppResult<DatabaseTransaction> {
        let isolation = if roles.contains(Role::SuperAdmin) {
            IsolationLevel::Serializable
        } else {
            IsolationLevel::ReadCommitted
        };

        self.db
            .begin_with_config(Some(isolation), Some(AccessMode::ReadWrite))
            .await
            .map_err(AppError::from)
    }
}

/// Commit on success, roll back on error
async fn finish<T>(txn: DatabaseTransaction, result: AppResult<T>) -> AppResult<T> {
    match result {
        Ok(value) => {
            txn.commit().await.map_err(AppError::from)?;
            Ok(value)
        }
        Err(e) => {
            if let Err(rollback_err) = txn.rollback().await {
                tracing::error!("Transaction rollback failed: {}", rollback_err);
            }
            Err(e)
        }
    }
}

fn role_set(rows: &[user_role::Model]) -> AppResult<RoleSet> {
    RoleSet::parse(rows.iter().map(|row| row.role.as_str())).map_err(AppError::from)
}

async fn load_user<C: ConnectionTrait>(conn: &C, model: user::Model) -> AppResult<User> {
    let rows = model.find_related(UserRoleEntity).all(conn).await?;
    let roles = role_set(&rows)?;
    Ok(model.into_user(roles))
}

async fn super_admins_other_than<C: ConnectionTrait>(
    conn: &C,
    exclude: Option<Uuid>,
) -> AppResult<u64> {
    let mut query =
        UserRoleEntity::find().filter(user_role::Column::Role.eq(Role::SuperAdmin.as_str()));
    if let Some(user_id) = exclude {
        query = query.filter(user_role::Column::UserId.ne(user_id));
    }

    query.count(conn).await.map_err(AppError::from)
}

async fn write_roles<C: ConnectionTrait>(conn: &C, user_id: Uuid, roles: &RoleSet) -> AppResult<()> {
    UserRoleEntity::delete_many()
        .filter(user_role::Column::UserId.eq(user_id))
        .exec(conn)
        .await?;

    let rows = roles.iter().map(|role| user_role::ActiveModel {
        user_id: Set(user_id),
        role: Set(role.as_str().to_string()),
    });
    UserRoleEntity::insert_many(rows).exec(conn).await?;

    Ok(())
}

async fn insert_user<C: ConnectionTrait>(conn: &C, new_user: NewUser) -> AppResult<User> {
    if new_user.roles.contains(Role::SuperAdmin) {
        ensure_super_admin_capacity(super_admins_other_than(conn, None).await?)?;
    }

    let now = chrono::Utc::now();
    let active_model = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(new_user.name),
        email: Set(new_user.email),
        national_id: Set(new_user.national_id),
        phone: Set(new_user.phone),
        photo_url: Set(new_user.photo_url),
        active: Set(true),
        address_id: Set(new_user.address_id),
        password_hash: Set(new_user.password_hash),
        created_at: Set(now),
        updated_at: Set(now),
    };

    let model = active_model.insert(conn).await?;
    write_roles(conn, model.id, &new_user.roles).await?;

    Ok(model.into_user(new_user.roles))
}

async fn replace_roles<C: ConnectionTrait>(conn: &C, id: Uuid, roles: RoleSet) -> AppResult<User> {
    let model = UserEntity::find_by_id(id)
        .one(conn)
        .await?
        .ok_or_else(|| AppError::not_found("User"))?;

    let current = load_user(conn, model.clone()).await?;
    if roles.contains(Role::SuperAdmin) && !current.is_super_admin() {
        ensure_super_admin_capacity(super_admins_other_than(conn, Some(id)).await?)?;
    }

    write_roles(conn, id, &roles).await?;

    let mut active: ActiveModel = model.into();
    active.updated_at = Set(chrono::Utc::now());
    let model = active.update(conn).await?;

    Ok(model.into_user(roles))
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let result = UserEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        match result {
            Some(model) => Ok(Some(load_user(&self.db, model).await?)),
            None => Ok(None),
        }
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        match result {
            Some(model) => Ok(Some(load_user(&self.db, model).await?)),
            None => Ok(None),
        }
    }

    async fn find_by_national_id(&self, national_id: &str) -> AppResult<Option<User>> {
        let result = UserEntity::find()
            .filter(user::Column::NationalId.eq(national_id))
            .order_by_asc(user::Column::CreatedAt)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        match result {
            Some(model) => Ok(Some(load_user(&self.db, model).await?)),
            None => Ok(None),
        }
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        let rows = UserEntity::find()
            .find_with_related(UserRoleEntity)
            .order_by_asc(user::Column::Name)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        rows.into_iter()
            .map(|(model, role_rows)| -> AppResult<User> {
                let roles = role_set(&role_rows)?;
                Ok(model.into_user(roles))
            })
            .collect()
    }

    async fn count_super_admins(&self) -> AppResult<u64> {
        super_admins_other_than(&self.db, None).await
    }

    async fn create(&self, user: NewUser) -> AppResult<User> {
        let txn = self.begin(&user.roles).await?;
        let result = insert_user(&txn, user).await;
        finish(txn, result).await
    }

    async fn update(&self, id: Uuid, changes: UserChanges) -> AppResult<User> {
        let model = UserEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::not_found("User"))?;

        let mut active: ActiveModel = model.into();

        if let Some(name) = changes.name {
            active.name = Set(name);
        }
        if let Some(email) = changes.email {
            active.email = Set(email);
        }
        if let Some(national_id) = changes.national_id {
            active.national_id = Set(Some(national_id));
        }
        if let Some(phone) = changes.phone {
            active.phone = Set(Some(phone));
        }
        if let Some(photo_url) = changes.photo_url {
            active.photo_url = Set(Some(photo_url));
        }
        if let Some(is_active) = changes.active {
            active.active = Set(is_active);
        }
        if let Some(address_id) = changes.address_id {
            active.address_id = Set(Some(address_id));
        }
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        load_user(&self.db, model).await
    }

    async fn set_roles(&self, id: Uuid, roles: RoleSet) -> AppResult<User> {
        let txn = self.begin(&roles).await?;
        let result = replace_roles(&txn, id, roles).await;
        finish(txn, result).await
    }

    async fn set_password(&self, id: Uuid, password_hash: String) -> AppResult<()> {
        let model = UserEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::not_found("User"))?;

        let mut active: ActiveModel = model.into();
        active.password_hash = Set(password_hash);
        active.updated_at = Set(chrono::Utc::now());

        active.update(&self.db).await.map_err(AppError::from)?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = UserEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::not_found("User"));
        }

        Ok(())
    }
}
