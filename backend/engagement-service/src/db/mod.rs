/// Database access layer: one repository per engagement entity.
pub mod comment_repo;
pub mod like_repo;
pub mod post_repo;

pub use comment_repo::CommentRepository;
pub use like_repo::LikeRepository;
pub use post_repo::PostRepository;
