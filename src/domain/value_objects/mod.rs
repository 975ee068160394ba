mod nickname;

pub use nickname::{Nickname, NicknameError, MAX_NICKNAME_LEN};
