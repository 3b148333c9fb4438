mod album;
mod artist;
mod member;
mod song;
mod user;

pub use album::ActiveModel as AlbumActive;
pub use album::Column as AlbumColumn;
pub use album::Entity as AlbumEntity;
pub use album::Model as Album;
pub use artist::ActiveModel as ArtistActive;
pub use artist::Column as ArtistColumn;
pub use artist::Entity as ArtistEntity;
pub use artist::Model as Artist;
pub use member::ActiveModel as MemberActive;
pub use member::Column as MemberColumn;
pub use member::Entity as MemberEntity;
pub use member::Model as Member;
pub use song::ActiveModel as SongActive;
pub use song::Column as SongColumn;
pub use song::Entity as SongEntity;
pub use song::Model as Song;
pub use user::ActiveModel as UserActive;
pub use user::Column as UserColumn;
pub use user::Entity as UserEntity;
pub use user::Model as User;
