mod api_response;
mod auth_token;
mod subscription;
mod test_user;
mod user_email;
mod user_name;
mod user_password;

pub use api_response::ApiResponse;
pub use auth_token::AuthToken;
pub use subscription::{Frequency, SubscriptionId, SubscriptionRequest, SubscriptionUpdate};
pub use test_user::TestUser;
pub use user_email::UserEmail;
pub use user_name::UserName;
pub use user_password::UserPassword;
