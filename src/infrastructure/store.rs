//! 内存数据表
//!
//! 以自增 `u64` 为主键、按主键有序保存记录。克隆得到的句柄共享同一份数据。

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// 存储错误类型
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("数据表 {0} 的锁已损坏")]
    Poisoned(String),
}

struct TableInner<T> {
    rows: BTreeMap<u64, T>,
    next_id: u64,
}

/// 在持有锁期间对数据表的读写视图
///
/// 由 [`MemoryTable::transaction`] 提供，检查与修改在同一把锁内完成。
/// 跨表操作时固定先锁 products，再锁其他表。
pub struct Rows<'a, T> {
    inner: &'a mut TableInner<T>,
}

impl<T: Clone> Rows<'_, T> {
    pub fn get(&self, id: u64) -> Option<&T> {
        self.inner.rows.get(&id)
    }

    pub fn get_mut(&mut self, id: u64) -> Option<&mut T> {
        self.inner.rows.get_mut(&id)
    }

    pub fn find<P>(&self, predicate: P) -> Option<&T>
    where
        P: Fn(&T) -> bool,
    {
        self.inner.rows.values().find(|row| predicate(row))
    }

    pub fn count_where<P>(&self, predicate: P) -> usize
    where
        P: Fn(&T) -> bool,
    {
        self.inner.rows.values().filter(|row| predicate(row)).count()
    }

    pub fn insert_with<F>(&mut self, build: F) -> T
    where
        F: FnOnce(u64) -> T,
    {
        let id = self.inner.next_id;
        self.inner.next_id += 1;
        let row = build(id);
        self.inner.rows.insert(id, row.clone());
        row
    }

    pub fn remove(&mut self, id: u64) -> Option<T> {
        self.inner.rows.remove(&id)
    }
}

/// 线程安全的内存表
pub struct MemoryTable<T> {
    name: &'static str,
    inner: Arc<Mutex<TableInner<T>>>,
}

impl<T> Clone for MemoryTable<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Clone> MemoryTable<T> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            inner: Arc::new(Mutex::new(TableInner {
                rows: BTreeMap::new(),
                next_id: 1,
            })),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    fn lock(&self) -> Result<MutexGuard<'_, TableInner<T>>, StoreError> {
        self.inner
            .lock()
            .map_err(|_| StoreError::Poisoned(self.name.to_string()))
    }

    /// 持有锁执行 `f`，期间其他调用方看不到中间状态
    pub fn transaction<R, F>(&self, f: F) -> Result<R, StoreError>
    where
        F: FnOnce(&mut Rows<'_, T>) -> R,
    {
        let mut guard = self.lock()?;
        let mut rows = Rows { inner: &mut *guard };
        Ok(f(&mut rows))
    }

    /// 分配主键并插入记录
    pub fn insert_with<F>(&self, build: F) -> Result<T, StoreError>
    where
        F: FnOnce(u64) -> T,
    {
        self.transaction(|rows| rows.insert_with(build))
    }

    /// 若已有记录满足 `conflict` 则返回 `Ok(Err(existing))`，否则插入
    pub fn insert_unless<P, F>(&self, conflict: P, build: F) -> Result<Result<T, T>, StoreError>
    where
        P: Fn(&T) -> bool,
        F: FnOnce(u64) -> T,
    {
        self.transaction(|rows| match rows.find(&conflict) {
            Some(existing) => Err(existing.clone()),
            None => Ok(rows.insert_with(build)),
        })
    }

    pub fn get(&self, id: u64) -> Result<Option<T>, StoreError> {
        Ok(self.lock()?.rows.get(&id).cloned())
    }

    /// 全部记录，按主键升序
    pub fn all(&self) -> Result<Vec<T>, StoreError> {
        Ok(self.lock()?.rows.values().cloned().collect())
    }

    pub fn remove(&self, id: u64) -> Result<Option<T>, StoreError> {
        Ok(self.lock()?.rows.remove(&id))
    }

    /// 删除所有满足条件的记录，返回删除数量
    pub fn remove_where<P>(&self, predicate: P) -> Result<usize, StoreError>
    where
        P: Fn(&T) -> bool,
    {
        let mut inner = self.lock()?;
        let before = inner.rows.len();
        inner.rows.retain(|_, row| !predicate(row));
        Ok(before - inner.rows.len())
    }

    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.lock()?.rows.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.lock()?.rows.is_empty())
    }
}
