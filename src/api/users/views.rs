use actix_multipart::Multipart;
use actix_web::{get, patch, post, web, HttpRequest, HttpResponse, Scope};

use buddyscript_config::Config;
use buddyscript_models::database::{
    get_database_client,
    DatabaseClient,
    DatabaseError,
    DbPool,
};
use buddyscript_models::users::queries::{
    create_user,
    get_user_by_email,
    get_user_by_id,
    is_registered_email,
    set_refresh_token,
    update_user,
};
use buddyscript_models::users::types::{User, UserCreateData, UserUpdateData};
use buddyscript_utils::passwords::{hash_password, verify_password};

use crate::api::auth::{
    cookies::{
        access_token_cookie,
        get_cookie_value,
        refresh_token_cookie,
        removal_cookies,
        REFRESH_TOKEN_COOKIE,
    },
    current_user::get_current_user,
    tokens::{create_token_pair, verify_refresh_token, TokenError, TokenPair},
};
use crate::api::responses::{ApiResponse, Empty};
use crate::api::uploads::read_multipart_form;
use crate::errors::HttpError;
use crate::media_host::{delete_image, upload_image};
use super::types::{
    ApiUser,
    AuthData,
    CurrentUserData,
    LoginData,
    ProfileUpdateData,
    RefreshTokenData,
    RegistrationData,
    TokenData,
};

/// Issues new token pair and stores refresh token
async fn issue_tokens(
    config: &Config,
    db_client: &impl DatabaseClient,
    user: &User,
) -> Result<TokenPair, HttpError> {
    let token_pair = create_token_pair(&config.auth, user).map_err(|error| {
        log::error!("{}", error);
        HttpError::InternalError("failed to issue tokens")
    })?;
    set_refresh_token(db_client, &user.id, Some(&token_pair.refresh_token)).await?;
    Ok(token_pair)
}

#[post("/register")]
async fn register_view(
    config: web::Data<Config>,
    db_pool: web::Data<DbPool>,
    data: web::Json<RegistrationData>,
) -> Result<HttpResponse, HttpError> {
    let db_client = &**get_database_client(&db_pool).await?;
    let mut registration_data = data.into_inner();
    registration_data.clean()?;
    if is_registered_email(db_client, &registration_data.email, None).await? {
        return Err(HttpError::ConflictError(
            "user with this email already exists".to_string(),
        ));
    };
    let password_hash = hash_password(&registration_data.password)
        .map_err(|_| HttpError::InternalError("failed to hash password"))?;
    let user_data = UserCreateData {
        first_name: registration_data.first_name,
        last_name: registration_data.last_name,
        email: registration_data.email,
        password_hash,
    };
    let user = create_user(db_client, user_data).await?;
    log::info!("created user {}", user.id);
    let token_pair = issue_tokens(&config, db_client, &user).await?;
    let response = ApiResponse::created(
        "User registered successfully",
        AuthData {
            user: ApiUser::from_user(&user),
            access_token: token_pair.access_token.clone(),
            refresh_token: token_pair.refresh_token.clone(),
        },
    );
    Ok(response.builder()
        .cookie(access_token_cookie(&config, token_pair.access_token))
        .cookie(refresh_token_cookie(&config, token_pair.refresh_token))
        .json(response))
}

#[post("/login")]
async fn login_view(
    config: web::Data<Config>,
    db_pool: web::Data<DbPool>,
    data: web::Json<LoginData>,
) -> Result<HttpResponse, HttpError> {
    let db_client = &**get_database_client(&db_pool).await?;
    let email = data.email.trim();
    if email.is_empty() || data.password.is_empty() {
        return Err(HttpError::ValidationError(
            "email and password are required".to_string(),
        ));
    };
    let user = match get_user_by_email(db_client, email).await {
        Ok(user) => user,
        Err(DatabaseError::NotFound(_)) => {
            return Err(HttpError::AuthError("invalid credentials"));
        },
        Err(other_error) => return Err(other_error.into()),
    };
    let password_correct = verify_password(&user.password_hash, &data.password)
        .map_err(|_| HttpError::AuthError("invalid credentials"))?;
    if !password_correct {
        return Err(HttpError::AuthError("invalid credentials"));
    };
    let token_pair = issue_tokens(&config, db_client, &user).await?;
    let response = ApiResponse::ok(
        "User logged in successfully",
        AuthData {
            user: ApiUser::from_user(&user),
            access_token: token_pair.access_token.clone(),
            refresh_token: token_pair.refresh_token.clone(),
        },
    );
    Ok(response.builder()
        .cookie(access_token_cookie(&config, token_pair.access_token))
        .cookie(refresh_token_cookie(&config, token_pair.refresh_token))
        .json(response))
}

#[post("/logout")]
async fn logout_view(
    config: web::Data<Config>,
    db_pool: web::Data<DbPool>,
    request: HttpRequest,
) -> Result<HttpResponse, HttpError> {
    let db_client = &**get_database_client(&db_pool).await?;
    let current_user = get_current_user(db_client, &config.auth, &request).await?;
    set_refresh_token(db_client, &current_user.id, None).await?;
    let response = ApiResponse::ok("User logged out successfully", Empty {});
    let [access_cookie, refresh_cookie] = removal_cookies(&config);
    Ok(response.builder()
        .cookie(access_cookie)
        .cookie(refresh_cookie)
        .json(response))
}

#[post("/refresh-token")]
async fn refresh_token_view(
    config: web::Data<Config>,
    db_pool: web::Data<DbPool>,
    request: HttpRequest,
    data: Option<web::Json<RefreshTokenData>>,
) -> Result<HttpResponse, HttpError> {
    let db_client = &**get_database_client(&db_pool).await?;
    let incoming_token = get_cookie_value(&request, REFRESH_TOKEN_COOKIE)
        .or_else(|| data.and_then(|data| data.into_inner().refresh_token))
        .ok_or(HttpError::AuthError("refresh token is required"))?;
    let claims = verify_refresh_token(&config.auth, &incoming_token)
        .map_err(|error| match error {
            TokenError::Expired => HttpError::AuthError("refresh token has expired"),
            _ => HttpError::AuthError("invalid refresh token"),
        })?;
    let user = match get_user_by_id(db_client, &claims.sub).await {
        Ok(user) => user,
        Err(DatabaseError::NotFound(_)) => {
            return Err(HttpError::AuthError("user not found"));
        },
        Err(other_error) => return Err(other_error.into()),
    };
    match user.refresh_token {
        None => return Err(HttpError::AuthError("no refresh token found")),
        Some(ref stored_token) if stored_token != &incoming_token => {
            return Err(HttpError::AuthError("refresh token has been revoked"));
        },
        Some(_) => (),
    };
    let token_pair = issue_tokens(&config, db_client, &user).await?;
    let response = ApiResponse::ok(
        "Access token refreshed successfully",
        TokenData {
            access_token: token_pair.access_token.clone(),
            refresh_token: token_pair.refresh_token.clone(),
        },
    );
    Ok(response.builder()
        .cookie(access_token_cookie(&config, token_pair.access_token))
        .cookie(refresh_token_cookie(&config, token_pair.refresh_token))
        .json(response))
}

#[get("/me")]
async fn current_user_view(
    config: web::Data<Config>,
    db_pool: web::Data<DbPool>,
    request: HttpRequest,
) -> Result<HttpResponse, HttpError> {
    let db_client = &**get_database_client(&db_pool).await?;
    let current_user = get_current_user(db_client, &config.auth, &request).await?;
    let user_data = CurrentUserData { user: ApiUser::from_user(&current_user) };
    Ok(ApiResponse::ok("Current user fetched successfully", user_data).into_response())
}

#[patch("/update")]
async fn update_user_view(
    config: web::Data<Config>,
    db_pool: web::Data<DbPool>,
    request: HttpRequest,
    payload: Multipart,
) -> Result<HttpResponse, HttpError> {
    let db_client = &**get_database_client(&db_pool).await?;
    let current_user = get_current_user(db_client, &config.auth, &request).await?;
    let form = read_multipart_form(payload, "avatar", &config.limits.media).await?;
    let profile_data = ProfileUpdateData {
        first_name: form.text("firstName"),
        last_name: form.text("lastName"),
        email: form.text("email"),
        // Passwords are not trimmed
        password: form.raw_text("password")
            .filter(|password| !password.trim().is_empty())
            .map(|password| password.to_string()),
    };
    profile_data.validate()?;
    if let Some(ref email) = profile_data.email {
        if is_registered_email(db_client, email, Some(&current_user.id)).await? {
            return Err(HttpError::ConflictError(
                "user with this email already exists".to_string(),
            ));
        };
    };
    let password_hash = match profile_data.password {
        Some(ref password) => Some(
            hash_password(password)
                .map_err(|_| HttpError::InternalError("failed to hash password"))?
        ),
        None => None,
    };
    let avatar = match form.file {
        Some(file) => {
            // Old image is deleted first
            if let Some(ref public_id) = current_user.avatar_public_id {
                let is_deleted = delete_image(&config.media_host, public_id).await?;
                if !is_deleted {
                    return Err(HttpError::InternalError("failed to delete old image"));
                };
            };
            let image = upload_image(
                &config.media_host,
                file.data,
                &file.file_name,
                &file.media_type,
            ).await?;
            Some(image)
        },
        None => None,
    };
    let update_data = UserUpdateData {
        first_name: profile_data.first_name,
        last_name: profile_data.last_name,
        email: profile_data.email,
        password_hash,
        avatar,
    };
    let user = update_user(db_client, &current_user.id, update_data).await?;
    Ok(ApiResponse::ok("User updated successfully", ApiUser::from_user(&user)).into_response())
}

pub fn user_api_scope() -> Scope {
    web::scope("/users")
        .service(register_view)
        .service(login_view)
        .service(logout_view)
        .service(refresh_token_view)
        .service(current_user_view)
        .service(update_user_view)
}
