//! Parcel layouts for `User` and `Category`.
//!
//! User: tag, identifier, category array.
//! Category: tag, owner identifier, name, note count, notes.

use super::codec::{ParcelError, ParcelReader, ParcelResult, ParcelWriter, Parcelable};
use crate::model::category::Category;
use crate::model::error::DataError;
use crate::model::key::UserKey;
use crate::model::user::User;

pub const USER_TAG: &str = "notesync.User";
pub const CATEGORY_TAG: &str = "notesync.Category";

impl Parcelable for Category {
    fn write_to_parcel(&self, dest: &mut ParcelWriter) {
        dest.write_tag(CATEGORY_TAG);
        dest.write_string(&self.owner().name);
        dest.write_string(self.name());
        dest.write_len(self.len());
        for note in self.notes() {
            dest.write_string(note);
        }
    }

    fn read_from_parcel(src: &mut ParcelReader<'_>) -> ParcelResult<Self> {
        src.expect_tag(CATEGORY_TAG)?;
        let owner = UserKey::new(src.read_string()?);
        let name = src.read_string()?;
        let count = src.read_len()?;
        let mut notes = Vec::with_capacity(count.min(src.remaining() / 4));
        for _ in 0..count {
            notes.push(src.read_string()?);
        }
        Ok(Category::with_notes(owner, name, notes))
    }
}

impl Parcelable for User {
    fn write_to_parcel(&self, dest: &mut ParcelWriter) {
        dest.write_tag(USER_TAG);
        dest.write_string(self.name());
        dest.write_array(self.categories());
    }

    fn read_from_parcel(src: &mut ParcelReader<'_>) -> ParcelResult<Self> {
        src.expect_tag(USER_TAG)?;
        let mut user = User::new(src.read_string()?);
        for category in src.read_array::<Category>()? {
            if category.owner() != user.key() {
                return Err(ParcelError::OwnerMismatch {
                    user: user.name().to_string(),
                    owner: category.owner().name.clone(),
                });
            }
            if user.category(category.name()).is_some() {
                return Err(ParcelError::Data(DataError::CategoryAlreadyExists(
                    category.name().to_string(),
                )));
            }
            user.insert_category(category)?;
        }
        Ok(user)
    }
}
