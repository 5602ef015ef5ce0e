use derive_new::new;

use crate::model::id::UserId;

// Minted only after the credentials have been verified.
#[derive(new)]
pub struct CreateToken {
    pub user_id: UserId,
}
