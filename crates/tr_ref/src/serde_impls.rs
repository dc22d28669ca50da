//! References serialize as their raw index. Pointers are process-local, so
//! deserializing rebuilds the pointer from the domain's current table and
//! validates it like any other construction.

use serde::de::Error;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tr_ptr::{Access, Strength};

use crate::array::Domain;
use crate::val_idx::ValIdx;
use crate::val_ptr_idx::ValPtrIdx;

impl<T, S> Serialize for ValIdx<T, S>
where
    T: Domain,
    T::Index: Serialize,
    S: Strength,
{
    #[inline(always)]
    fn serialize<Ser>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error>
    where
        Ser: Serializer,
    {
        self.get().serialize(serializer)
    }
}

impl<'de, T, S> Deserialize<'de> for ValIdx<T, S>
where
    T: Domain,
    T::Index: Deserialize<'de>,
    S: Strength,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let index: T::Index = Deserialize::deserialize(deserializer)?;
        ValIdx::new(index).map_err(D::Error::custom)
    }
}

impl<T, S, A> Serialize for ValPtrIdx<T, S, A>
where
    T: Domain,
    T::Index: Serialize,
    S: Strength,
    A: Access,
{
    #[inline(always)]
    fn serialize<Ser>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error>
    where
        Ser: Serializer,
    {
        self.index().serialize(serializer)
    }
}

impl<'de, T, S, A> Deserialize<'de> for ValPtrIdx<T, S, A>
where
    T: Domain,
    T::Index: Deserialize<'de>,
    S: Strength,
    A: Access,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let index: T::Index = Deserialize::deserialize(deserializer)?;
        ValPtrIdx::from_index(index).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;
    use alloc::vec::Vec;

    use crate::{Idx, PtrIdx, VIdx, VPtrIdx, declare_domain};

    pub struct Wall(u8);

    static WALLS: [Wall; 3] = [Wall(0), Wall(1), Wall(2)];

    declare_domain!(Wall: u32 => [Wall; 3] = WALLS);

    #[test]
    fn serialize_as_index() {
        let wall = VPtrIdx::<Wall>::from_index(2).unwrap();
        assert_eq!(serde_json::to_string(&wall).unwrap(), "2");
        assert_eq!(serde_json::to_string(&Idx::<Wall>::none()).unwrap(), "4294967295");
    }

    #[test]
    fn deserialize_rebuilds_pointer() {
        let wall: VPtrIdx<Wall> = serde_json::from_str("1").unwrap();
        assert_eq!(wall, &raw const WALLS[1]);
        // SAFETY: `WALLS` is a static.
        assert_eq!(unsafe { wall.as_ref() }.0, 1);

        let walls: Vec<PtrIdx<Wall>> = serde_json::from_str("[0, 4294967295]").unwrap();
        assert!(!walls[0].is_none());
        assert!(walls[1].is_none());
    }

    #[test]
    fn deserialize_validates() {
        let e = serde_json::from_str::<VIdx<Wall>>("3").unwrap_err();
        assert!(e.to_string().contains("invalid index 3"));

        let e = serde_json::from_str::<VPtrIdx<Wall>>("4294967295").unwrap_err();
        assert!(e.to_string().starts_with("Index range check failed"));

        assert!(serde_json::from_str::<Idx<Wall>>("4294967295").is_ok());
    }
}
