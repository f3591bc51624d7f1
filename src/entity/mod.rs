//! sea-orm entities, one per table created by the `migration` crate.

pub mod comments;
pub mod groups;
pub mod posts;
pub mod tokens;
pub mod users;

pub mod prelude {
    pub use super::comments::Entity as Comment;
    pub use super::groups::Entity as Group;
    pub use super::posts::Entity as Post;
    pub use super::tokens::Entity as Token;
    pub use super::users::Entity as User;
}
