use std::sync::Arc;

use uuid::Uuid;

use crate::{
    dtos::supplier::{CreateSupplierRequest, UpdateSupplierRequest},
    models::{Role, Supplier, SupplierResponse},
    services::{Identity, ServiceError},
    store::Store,
};

/// Page size for the supplier directory.
const SUPPLIER_PAGE_SIZE: u32 = 5;

/// Admin-managed vendor directory.
#[derive(Clone)]
pub struct SupplierService {
    store: Arc<dyn Store>,
}

impl SupplierService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn create_supplier(
        &self,
        caller: Identity,
        req: CreateSupplierRequest,
    ) -> Result<SupplierResponse, ServiceError> {
        caller.require_role(Role::Admin)?;

        let supplier = Supplier::new(req.name, req.email, req.phone, req.address);
        self.store.insert_supplier(&supplier).await?;

        tracing::info!(supplier_id = %supplier.supplier_id, "Supplier created");

        Ok(supplier.into())
    }

    pub async fn update_supplier(
        &self,
        caller: Identity,
        supplier_id: Uuid,
        req: UpdateSupplierRequest,
    ) -> Result<SupplierResponse, ServiceError> {
        caller.require_role(Role::Admin)?;

        let mut supplier = self
            .store
            .find_supplier(supplier_id)
            .await?
            .ok_or(ServiceError::NotFound("Supplier"))?;

        supplier.name = req.name;
        supplier.email = req.email;
        supplier.phone = req.phone;
        supplier.address = req.address;

        if !self.store.update_supplier(&supplier).await? {
            return Err(ServiceError::NotFound("Supplier"));
        }

        Ok(supplier.into())
    }

    pub async fn delete_supplier(
        &self,
        caller: Identity,
        supplier_id: Uuid,
    ) -> Result<(), ServiceError> {
        caller.require_role(Role::Admin)?;

        if !self.store.delete_supplier(supplier_id).await? {
            return Err(ServiceError::NotFound("Supplier"));
        }

        Ok(())
    }

    pub async fn get_supplier(
        &self,
        caller: Identity,
        supplier_id: Uuid,
    ) -> Result<SupplierResponse, ServiceError> {
        caller.require_role(Role::Admin)?;

        let supplier = self
            .store
            .find_supplier(supplier_id)
            .await?
            .ok_or(ServiceError::NotFound("Supplier"))?;
        Ok(supplier.into())
    }

    /// One page of the directory, newest first.
    pub async fn list_suppliers(
        &self,
        caller: Identity,
        page: u32,
    ) -> Result<(Vec<SupplierResponse>, u32, u64), ServiceError> {
        caller.require_role(Role::Admin)?;

        let page = page.max(1);
        let (suppliers, total) = self
            .store
            .list_suppliers(page, SUPPLIER_PAGE_SIZE)
            .await?;

        let total_pages = (total as u32).div_ceil(SUPPLIER_PAGE_SIZE);
        let items = suppliers.into_iter().map(Into::into).collect();
        Ok((items, total_pages, total))
    }
}
